mod price_record;

pub use price_record::{PLACEHOLDER, PriceRecord, PriceRecordBuilder};
