//! Shared constants and invariants

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "8000";

pub const DEFAULT_TOKEN_VALIDITY_WINDOW_SECS: u64 = 300;
pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 15;

pub const DEFAULT_API_PREFIX: &str = "/api/rest/onlinesales/v1";
pub const OPERATIONS_SEGMENT: &str = "cgaOnlineSales";
pub const PAYMENT_MEANS_PATH: &str = "/api/v1/paymentMeans";

pub const DEFAULT_COUNTRY_ID: &str = "114";
pub const DEFAULT_SALE_DEVICE_ID: &str = "MYPOS";
pub const DEFAULT_DISTRIBUTOR_ID: &str = "23268";

// Secondary provider management acts
pub const MANAGEMENT_ACT_FLASH_RENEWAL: &str = "FLASH_RENEWAL";
pub const MANAGEMENT_ACT_RENEWAL_QUICK: &str = "RENEWAL_QUICK";

pub const API_KEY_HEADER: &str = "x-api-key";
pub const SEVERITY_SUCCESS: &str = "SUCCESS";

pub const REPORT_PATH_MARKER: &str = "reports/";
pub const DEFAULT_REPORT_FILENAME: &str = "recu.pdf";
