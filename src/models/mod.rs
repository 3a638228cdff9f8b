pub mod daily_record;
pub mod enums;
pub mod medication;
pub mod patient;
pub mod time_of_day;

pub use daily_record::*;
pub use enums::*;
pub use medication::*;
pub use patient::*;
pub use time_of_day::*;
