pub mod bridge_datetime;
pub mod frame;
pub mod query;
pub mod transformer;
pub mod translator;

pub use bridge_datetime::BridgeDateTime;
pub use frame::{Field, FieldValues, Frame, FrameLabels};
pub use query::{DataQuery, DataResponse, Dimension, QueryDataRequest, QueryModel, TimeRange};
