//! # fontpack-api
//!
//! HTTP front-end for the fontpack conversion pipeline
//!

mod api;
pub use api::{
    app, convert_fonts, health_check, supported_formats, upload_page, AppError, AppState,
    ErrorResponse,
};
