use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    AssociationFailed,
    AllCandidatesFailed,
    ChannelClosed,
    ChannelError,
    Decode,
    Encode,
    SendDropped,
    Hardware,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AssociationFailed => write!(f, "Wireless association failed"),
            Error::AllCandidatesFailed => write!(f, "All wireless candidates failed"),
            Error::ChannelClosed => write!(f, "Channel is closed"),
            Error::ChannelError => write!(f, "Channel transport error"),
            Error::Decode => write!(f, "Malformed inbound frame"),
            Error::Encode => write!(f, "Frame encoding failed"),
            Error::SendDropped => write!(f, "Send dropped, channel not open"),
            Error::Hardware => write!(f, "Hardware access failed"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
