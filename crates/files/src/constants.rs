/// URL prefix rewritten avatar paths are served under.
pub const AVATAR_URL_PREFIX: &str = "/avatars";

/// Extension appended to every hashed filename.
pub const HASHED_EXTENSION: &str = ".png";

/// Random bytes in a per-run secret.
pub const SECRET_BYTES: usize = 16;

pub const DEFAULT_SECRET_FILE: &str = "avatar-secret.txt";
pub const DEFAULT_AVATARS_DIR: &str = "public/avatars";
