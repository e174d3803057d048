mod group;
mod labels;
mod metric;
mod point;
mod resource;
mod timeseries;
mod timestamp;
mod value;

pub use group::*;
pub use labels::*;
pub use metric::*;
pub use point::*;
pub use resource::*;
pub use timeseries::*;
pub use timestamp::*;
pub use value::*;
