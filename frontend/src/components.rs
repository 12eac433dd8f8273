pub mod animation;
pub mod detect_step;
pub mod header;
pub mod results_step;
pub mod sidebar;
pub mod tabs;
pub mod upload_step;
pub mod utils;
