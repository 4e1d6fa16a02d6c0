pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Resource type for every upload; Cloudinary detects image, video or raw.
pub const RESOURCE_TYPE: &str = "auto";

pub const SIGNATURE_ALGORITHM: &str = "sha256";

pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_CLOUD_NAME";
pub const API_KEY_VAR: &str = "CLOUDINARY_API_KEY";
pub const API_SECRET_VAR: &str = "CLOUDINARY_API_SECRET";

pub const REQUEST_TIMEOUT_SECS: u64 = 120;
