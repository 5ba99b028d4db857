//! Validation bounds, the date format contract and the messages shown next
//! to invalid form fields.

pub const TYPE_NAME_MIN_LENGTH: usize = 5;
pub const TYPE_NAME_MAX_LENGTH: usize = 15;

pub const EVENT_NAME_MIN_LENGTH: usize = 5;
pub const EVENT_NAME_MAX_LENGTH: usize = 20;

pub const EVENT_DESCRIPTION_MIN_LENGTH: usize = 15;
pub const EVENT_DESCRIPTION_MAX_LENGTH: usize = 150;

/// `yyyy-MM-dd H:mm`, hour without padding.
pub const EVENT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %-H:%M";

/// Input side of the date contract. chrono accepts one or two hour digits here.
pub const EVENT_DATE_TIME_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const DATE_TIME_ERROR: &str = "Invalid date! Format must be: yyyy-MM-dd H:mm";
pub const END_BEFORE_START_ERROR: &str = "End must be after start";
pub const UNKNOWN_TYPE_ERROR: &str = "Type does not exist";
