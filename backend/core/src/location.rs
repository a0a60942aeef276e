//! Resolving document locations to local paths.

use std::path::PathBuf;

use url::Url;

use crate::error::LocationError;

/// Map a document location to a local filesystem path.
///
/// Plain paths resolve as-is. `file://` URIs are percent-decoded and must
/// name no host other than `localhost`. Any other scheme (`gs://`, `s3://`,
/// `https://`) is [`LocationError::RemoteScheme`].
pub fn local_path(location: &str) -> Result<PathBuf, LocationError> {
    match scheme(location) {
        None => Ok(PathBuf::from(location)),
        Some(s) if s.eq_ignore_ascii_case("file") => file_uri_path(location),
        Some(s) => Err(LocationError::RemoteScheme(s.to_string())),
    }
}

fn file_uri_path(uri: &str) -> Result<PathBuf, LocationError> {
    let invalid = |reason| LocationError::InvalidFileUri {
        uri: uri.to_string(),
        reason,
    };
    let url = Url::parse(uri).map_err(|_| invalid("not a valid URI"))?;
    if matches!(url.host_str(), Some(host) if !host.is_empty() && host != "localhost") {
        return Err(invalid("remote hosts are not supported"));
    }
    url.to_file_path().map_err(|()| invalid("not an absolute local path"))
}

/// The URI scheme of a location, if it has one.
pub fn scheme(location: &str) -> Option<&str> {
    let (head, _) = location.split_once("://")?;
    let valid = !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_resolve() {
        assert_eq!(local_path("/data/a.pdf"), Ok(PathBuf::from("/data/a.pdf")));
        assert_eq!(local_path("rel/a.pdf"), Ok(PathBuf::from("rel/a.pdf")));
    }

    #[test]
    fn file_uri_resolves() {
        assert_eq!(local_path("file:///data/a.pdf"), Ok(PathBuf::from("/data/a.pdf")));
        assert_eq!(
            local_path("file://localhost/data/a.pdf"),
            Ok(PathBuf::from("/data/a.pdf"))
        );
    }

    #[test]
    fn file_uri_is_percent_decoded() {
        assert_eq!(
            local_path("file:///scans/march%20batch/a%20b.pdf"),
            Ok(PathBuf::from("/scans/march batch/a b.pdf"))
        );
    }

    #[test]
    fn file_uri_with_remote_host_is_rejected() {
        let err = local_path("file://fileserver/share/a.pdf").unwrap_err();
        assert!(matches!(err, LocationError::InvalidFileUri { .. }));
        assert!(err.to_string().contains("file://fileserver/share/a.pdf"));
    }

    #[test]
    fn remote_schemes_do_not_resolve() {
        assert_eq!(
            local_path("gs://bucket/a.pdf"),
            Err(LocationError::RemoteScheme("gs".into()))
        );
        assert_eq!(scheme("gs://bucket/a.pdf"), Some("gs"));
        assert_eq!(scheme("/no/scheme"), None);
    }
}
