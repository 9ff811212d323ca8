//! User-facing feedback strings, shared between sign-up and sign-in.

pub const EMAIL_REQUIRED: &str = "Please enter your email address";
pub const EMAIL_MALFORMED: &str =
  "The value you’ve entered is not a valid email address";
pub const EMAIL_UNKNOWN: &str =
  "The email you’ve entered doesn’t match any account";
pub const EMAIL_TAKEN: &str =
  "The email you’ve entered is already in use by another account";

pub const PASSWORD_REQUIRED: &str = "Please enter your password";
pub const PASSWORD_TOO_SHORT: &str =
  "The password you’ve entered is too short to be valid";
pub const PASSWORD_INCORRECT: &str =
  "The password you’ve entered is incorrect";

pub const CONFIRMATION_REQUIRED: &str = "Please enter your password again";
pub const CONFIRMATION_MISMATCH: &str =
  "The passwords you’ve entered don’t match";
