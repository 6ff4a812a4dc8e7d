// Pure extraction and helpers
pub mod clean;
pub mod detail;
pub mod ratio;
pub mod tile;

// Side-effecting tools
pub mod export;
pub mod images;
pub mod retry;
