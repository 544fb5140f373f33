pub mod header;
pub mod upload_area;
pub mod loading_state;
pub mod result_view;
pub mod error_view;
