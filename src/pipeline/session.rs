use crate::config;
use crate::pipeline::Error;

/// Platform handle of the rendering surface the video sink draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySurface(usize);

impl DisplaySurface {
    pub fn raw(&self) -> usize {
        self.0
    }
}

impl From<usize> for DisplaySurface {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

/// The (camera address, display surface) pair one pipeline is built for.
/// Immutable for the pipeline's whole lifetime.
#[derive(Debug, Clone)]
pub struct Session {
    address: String,
    surface: DisplaySurface,
}

impl Session {
    /// Only the host part of the stream URI is user-supplied, so separators
    /// and whitespace are rejected rather than escaped.
    pub fn new(address: impl Into<String>, surface: DisplaySurface) -> Result<Self, Error> {
        let address = address.into();
        if address.is_empty()
            || address.contains(|c: char| c.is_whitespace() || "/?#@:".contains(c))
        {
            return Err(Error::InvalidAddress);
        }
        Ok(Self { address, surface })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn surface(&self) -> DisplaySurface {
        self.surface
    }

    /// The camera exposes its motion-jpeg stream at this fixed location;
    /// everything but the host is part of the wire contract.
    pub fn stream_uri(&self) -> String {
        format!(
            "rtsp://{}:{}/{}?{}",
            self.address,
            config::RTSP_PORT,
            config::STREAM_PATH,
            config::STREAM_QUERY
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> DisplaySurface {
        DisplaySurface::from(42)
    }

    #[test]
    fn test_stream_uri_matches_camera_contract() {
        let session = Session::new("192.168.1.61", surface()).unwrap();
        assert_eq!(
            session.stream_uri(),
            "rtsp://192.168.1.61:554/axis-media/media.amp?videocodec=jpeg&audio=0"
        );
    }

    #[test]
    fn test_empty_address_rejected() {
        assert!(matches!(
            Session::new("", surface()),
            Err(Error::InvalidAddress)
        ));
    }

    #[test]
    fn test_malformed_addresses_rejected() {
        for address in [
            "192.168.1.61/stream",
            "camera.local:8554",
            "user@camera",
            "camera one",
            "camera?audio=1",
        ] {
            assert!(
                matches!(Session::new(address, surface()), Err(Error::InvalidAddress)),
                "address {address:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hostname_accepted() {
        let session = Session::new("camera.example.org", surface()).unwrap();
        assert_eq!(session.address(), "camera.example.org");
        assert_eq!(session.surface().raw(), 42);
    }
}
