/*!
Logging macros that forward to the `log` crate when the `logging`
feature is enabled and compile to nothing otherwise. Only the levels
the decode paths and the registry actually emit are defined.
*/

macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
