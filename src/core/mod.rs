// Core modules implementing response decoding, label access, and error modeling.
pub mod error;
pub mod metric;
pub mod response;
pub mod sample;
pub mod series;
pub mod value;
pub mod warning;
