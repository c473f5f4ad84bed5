pub mod transfer;
pub mod util;
