use core::{error::Error, fmt};

use esp_wifi::{wifi::WifiError, wifi_interface::{IoError, WifiStackError}, InitializationError};
use protocol::EncodeError;
use tracker::TrackerError;


/// Anything that stops the firmware from getting to the main loop, all of these end in a reset.
/// 
#[derive(Debug)]
pub enum AppError
{
    RadioInit(InitializationError),
    Wifi(WifiError),
    Tracker(TrackerError),
}

impl Error for AppError {}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RadioInit(err) => write!(f, "Radio initialization error: {:?}", err),
            Self::Wifi(err) => write!(f, "WiFi error: {:?}", err),
            Self::Tracker(err) => write!(f, "Tracker error: {}", err),
        }
    }
}

impl From<InitializationError> for AppError
{
    fn from(err: InitializationError) -> Self {
        AppError::RadioInit(err)
    }
}

impl From<WifiError> for AppError
{
    fn from(err: WifiError) -> Self {
        AppError::Wifi(err)
    }
}

impl From<TrackerError> for AppError
{
    fn from(err: TrackerError) -> Self {
        AppError::Tracker(err)
    }
}


/// Errors of the network stack, reported through the tracker's collaborator traits.
/// 
#[derive(Debug)]
pub enum NetError
{
    Wifi(WifiError),
    Stack(WifiStackError),
    Socket(IoError),
    Encode(EncodeError),
    /// The access point or the DHCP server did not answer in time.
    Timeout,
    /// Tried to announce before the interface got an address.
    NoAddress,
    /// SSID or password too long for the driver.
    Credentials,
}

impl Error for NetError {}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Wifi(err) => write!(f, "WiFi error: {:?}", err),
            Self::Stack(err) => write!(f, "Network stack error: {:?}", err),
            Self::Socket(err) => write!(f, "Socket error: {:?}", err),
            Self::Encode(err) => write!(f, "Encode error: {}", err),
            Self::Timeout => write!(f, "Timed out"),
            Self::NoAddress => write!(f, "Interface has no address"),
            Self::Credentials => write!(f, "WiFi credentials do not fit"),
        }
    }
}

impl From<WifiError> for NetError
{
    fn from(err: WifiError) -> Self {
        NetError::Wifi(err)
    }
}

impl From<WifiStackError> for NetError
{
    fn from(err: WifiStackError) -> Self {
        NetError::Stack(err)
    }
}

impl From<IoError> for NetError
{
    fn from(err: IoError) -> Self {
        NetError::Socket(err)
    }
}

impl From<EncodeError> for NetError
{
    fn from(err: EncodeError) -> Self {
        NetError::Encode(err)
    }
}
