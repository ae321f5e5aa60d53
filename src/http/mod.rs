//! HTTP protocol layer module
//!
//! Content-type lookup and response construction, decoupled from the
//! filesystem logic in `handler`.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_204_response, build_400_response, build_403_response, build_404_response,
    build_405_response, build_413_response, build_500_response, build_file_response,
    build_put_success_response,
};
