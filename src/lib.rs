pub mod gazetteer;
pub mod graph;
pub mod pipeline;
pub mod resolver;
pub mod router;
pub mod schedule;
pub mod shared;
pub mod stops;

pub mod prelude {
    pub use crate::gazetteer::Gazetteer;
    pub use crate::graph::{GraphBuilder, StopGraph};
    pub use crate::pipeline::Pipeline;
    pub use crate::resolver::Resolver;
    pub use crate::router::Router;
    pub use crate::stops::StopIndex;
}
