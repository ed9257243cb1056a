//! Provenance-anchored label retrieval.
//!
//! Labels are read from an already-open handle with `fgetxattr`, never by
//! path, so the label always belongs to the object the caller holds. The
//! bytes come back verbatim; only [`XattrReader::read_context`] strips the
//! kernel's single trailing NUL before handing them to the parser gate.

use std::io;
use std::os::fd::AsFd;

use thiserror::Error;
use tracing::trace;

use crate::config::{XattrConfig, DEFAULT_XATTR_MAX, DEFAULT_XATTR_NAME};
use crate::error::LabelError;
use crate::gate;
use crate::label::SecurityContext;

/// Attribute holding the SELinux security context.
pub const XATTR_NAME_SELINUX: &str = DEFAULT_XATTR_NAME;

/// Failures while retrieving or decoding a label.
#[derive(Debug, Error)]
pub enum XattrError {
    /// The syscall failed (`EACCES`, `ENODATA`, `EOPNOTSUPP`, ...).
    #[error("failed to read {attribute}: {source}")]
    AttributeReadFailure {
        /// Attribute name.
        attribute: String,
        /// OS error exactly as reported.
        #[source]
        source: io::Error,
    },
    /// The attribute is larger than the configured bound.
    #[error("{attribute} is {reported} bytes, limit is {limit}")]
    OversizedAttribute {
        /// Attribute name.
        attribute: String,
        /// Size reported by the probe.
        reported: usize,
        /// Configured bound.
        limit: usize,
    },
    /// The attribute exists but has no bytes.
    #[error("{attribute} is empty")]
    EmptyAttribute {
        /// Attribute name.
        attribute: String,
    },
    /// The attribute changed size between the probe and the read.
    #[error("{attribute} changed size between probe ({probed}) and read ({read})")]
    SizeChanged {
        /// Attribute name.
        attribute: String,
        /// Size from the probe.
        probed: usize,
        /// Size from the read.
        read: usize,
    },
    /// The bytes were read but are not a valid context.
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// Two-phase bounded `fgetxattr` reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XattrReader {
    attribute: String,
    max_size: usize,
}

impl Default for XattrReader {
    fn default() -> Self {
        Self::new(DEFAULT_XATTR_MAX)
    }
}

impl XattrReader {
    /// Reader for `security.selinux` with the given size bound.
    pub fn new(max_size: usize) -> Self {
        Self {
            attribute: XATTR_NAME_SELINUX.to_owned(),
            max_size,
        }
    }

    /// Reader configured from the `[xattr]` section.
    pub fn from_config(config: &XattrConfig) -> Self {
        Self {
            attribute: config.attribute.clone(),
            max_size: config.max_size,
        }
    }

    /// Size bound in bytes.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Attribute read by [`read_context`](Self::read_context).
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Read `attribute` from `handle` verbatim, embedded NULs included.
    ///
    /// # Errors
    ///
    /// [`XattrError::AttributeReadFailure`] carrying the OS error,
    /// [`XattrError::EmptyAttribute`], [`XattrError::OversizedAttribute`], or
    /// [`XattrError::SizeChanged`].
    pub fn read_raw<Fd: AsFd>(&self, handle: Fd, attribute: &str) -> Result<Vec<u8>, XattrError> {
        let fd = handle.as_fd();
        let failure = |errno: rustix::io::Errno| XattrError::AttributeReadFailure {
            attribute: attribute.to_owned(),
            source: io::Error::from(errno),
        };

        let probed = rustix::fs::fgetxattr(fd, attribute, &mut []).map_err(failure)?;
        if probed == 0 {
            return Err(XattrError::EmptyAttribute {
                attribute: attribute.to_owned(),
            });
        }
        if probed > self.max_size {
            return Err(XattrError::OversizedAttribute {
                attribute: attribute.to_owned(),
                reported: probed,
                limit: self.max_size,
            });
        }

        let mut buffer = vec![0u8; probed];
        let read = rustix::fs::fgetxattr(fd, attribute, &mut buffer).map_err(failure)?;
        if read != probed {
            return Err(XattrError::SizeChanged {
                attribute: attribute.to_owned(),
                probed,
                read,
            });
        }
        trace!(attribute, bytes = read, "xattr read");
        Ok(buffer)
    }

    /// Read and validate the security context of `handle`.
    ///
    /// Exactly one trailing NUL is removed; any other NUL reaches the gate
    /// and is rejected there.
    ///
    /// # Errors
    ///
    /// Any [`read_raw`](Self::read_raw) failure, or [`XattrError::Label`]
    /// when the gate rejects the bytes.
    pub fn read_context<Fd: AsFd>(&self, handle: Fd) -> Result<SecurityContext, XattrError> {
        let raw = self.read_raw(handle, &self.attribute)?;
        let label = raw.strip_suffix(b"\0").unwrap_or(&raw);
        Ok(gate::parse_context(label)?)
    }
}
