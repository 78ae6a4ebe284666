pub mod intake;
pub mod live_list;
pub mod notify;
pub mod review;
