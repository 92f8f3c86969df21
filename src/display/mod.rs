pub mod progress;
pub mod table;
pub mod toast;

pub use progress::{ProgressView, UploadSpinner, print_progress};
pub use table::TableDisplay;
pub use toast::{Toast, ToastCenter, ToastKind};
