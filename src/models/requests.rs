//! Request DTOs for the blog API
//!
//! Forms as submitted by clients, and their validated counterparts.

use imagesize::ImageType;
use serde::Deserialize;

use crate::error::{FormErrors, Result};
use crate::store::models::GroupId;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE_MESSAGE: &str = "Upload a valid image. The file you uploaded was either \
     not an image or a corrupted image.";
pub const INVALID_USERNAME_MESSAGE: &str = "Enter a valid username. This value may contain only \
     letters, numbers, and @/./+/-/_ characters.";
pub const BAD_CREDENTIALS_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub const MAX_USERNAME_CHARS: usize = 150;
pub const MIN_PASSWORD_CHARS: usize = 8;

/// `?page=` on every feed route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

// == Images ==

/// An upload that was recognized as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: &'static str,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Accepts GIF, PNG, JPEG, WebP and BMP data with non-zero dimensions.
    pub fn from_upload(filename: &str, bytes: Vec<u8>) -> std::result::Result<Self, String> {
        let invalid = || INVALID_IMAGE_MESSAGE.to_string();

        let size = imagesize::blob_size(&bytes).map_err(|_| invalid())?;
        if size.width == 0 || size.height == 0 {
            return Err(invalid());
        }

        let (content_type, extension) = match imagesize::image_type(&bytes).map_err(|_| invalid())? {
            ImageType::Gif => ("image/gif", "gif"),
            ImageType::Png => ("image/png", "png"),
            ImageType::Jpeg => ("image/jpeg", "jpg"),
            ImageType::Webp => ("image/webp", "webp"),
            ImageType::Bmp => ("image/bmp", "bmp"),
            _ => return Err(invalid()),
        };

        Ok(Self {
            filename: filename.to_string(),
            content_type,
            extension,
            bytes,
        })
    }
}

// == Post Form ==

/// Raw post form, as collected from a multipart body.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: Option<String>,
    pub group: Option<String>,
    /// File name and bytes of the `image` part
    pub image: Option<(String, Vec<u8>)>,
}

/// A post form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidPostForm {
    pub text: String,
    pub group_id: Option<GroupId>,
    pub image: Option<UploadedImage>,
}

impl PostForm {
    /// Validates every field, collecting all messages before failing.
    ///
    /// `group_exists` decides whether a submitted group id is a valid choice.
    pub fn validate(self, group_exists: impl Fn(GroupId) -> bool) -> Result<ValidPostForm> {
        let mut errors = FormErrors::new();

        let text = self.text.unwrap_or_default();
        if text.trim().is_empty() {
            errors.add("text", REQUIRED_MESSAGE);
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<GroupId>() {
                Ok(id) if group_exists(id) => Some(id),
                _ => {
                    errors.add("group", INVALID_CHOICE_MESSAGE);
                    None
                }
            },
        };

        // Browsers send an empty, unnamed part when no file was picked.
        let image = match self.image {
            Some((filename, bytes)) if !(filename.is_empty() && bytes.is_empty()) => {
                match UploadedImage::from_upload(&filename, bytes) {
                    Ok(image) => Some(image),
                    Err(message) => {
                        errors.add("image", message);
                        None
                    }
                }
            }
            _ => None,
        };

        errors.into_result()?;
        Ok(ValidPostForm {
            text,
            group_id,
            image,
        })
    }
}

// == Comment Form ==

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            return Some(REQUIRED_MESSAGE.to_string());
        }
        None
    }
}

// == Account Forms ==

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::new();

        if self.username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
        } else if !is_valid_username(&self.username) {
            errors.add("username", INVALID_USERNAME_MESSAGE);
        }

        if self.password.is_empty() {
            errors.add("password", REQUIRED_MESSAGE);
        } else if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.add(
                "password",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    MIN_PASSWORD_CHARS
                ),
            );
        }

        errors.into_result()
    }
}

/// 1 to 150 letters, digits and `@ . + - _`.
pub fn is_valid_username(username: &str) -> bool {
    let count = username.chars().count();
    (1..=MAX_USERNAME_CHARS).contains(&count)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FormErrors::new();
        if self.username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED_MESSAGE);
        }
        errors.into_result()
    }

    /// Where to go after a successful login. Only local paths are honored.
    pub fn redirect_target(&self) -> String {
        match self.next.as_deref() {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next.to_string(),
            _ => "/".to_string(),
        }
    }
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}
