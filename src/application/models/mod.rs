pub mod camera;

pub mod event;

pub mod response;

pub use camera::{Actuator, Camera};
pub use event::{ActuationEvent, ClassifiedAnimal, DetectionEvent};
pub use response::{DataResponse, FilterOptions, ImageBlob, Paginated};
