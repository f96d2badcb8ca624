use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("coordinate outside projection domain: lat={lat}, lon={lon}")]
    OutOfDomain { lat: f64, lon: f64 },

    #[error(
        "render buffer allocation refused: {width}x{height} px needs {requested_bytes} bytes, limit is {limit_bytes}"
    )]
    RenderAllocationFailed {
        width: u32,
        height: u32,
        requested_bytes: u64,
        limit_bytes: u64,
    },

    #[error("chart kind `{kind}` does not declare capability `{capability}`")]
    UnsupportedCapability {
        kind: &'static str,
        capability: &'static str,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
