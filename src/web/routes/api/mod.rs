pub mod waitlist;

pub use waitlist::{waitlist_count, waitlist_submit};
