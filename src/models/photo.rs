/// Image formats the registration form accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoType {
    Jpeg,
    Png,
}

impl PhotoType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(PhotoType::Jpeg),
            "image/png" => Some(PhotoType::Png),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            PhotoType::Jpeg => "image/jpeg",
            PhotoType::Png => "image/png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_jpeg_aliases_and_png() {
        assert_eq!(PhotoType::from_mime("image/jpeg"), Some(PhotoType::Jpeg));
        assert_eq!(PhotoType::from_mime("IMAGE/JPG"), Some(PhotoType::Jpeg));
        assert_eq!(PhotoType::from_mime("image/png"), Some(PhotoType::Png));
        assert_eq!(PhotoType::from_mime("application/pdf"), None);
        assert_eq!(PhotoType::from_mime("image/gif"), None);
    }
}
