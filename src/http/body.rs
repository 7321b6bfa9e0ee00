//! Pull-driven response body producers.
//!
//! The engine (hyper) pulls frames from these bodies one at a time and
//! drops the body exactly once when the response completes or is
//! abandoned, which closes the underlying handle. Neither producer is
//! shared across requests.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use http_body_util::Full;
use hyper::body::{Body, Bytes, Frame, SizeHint};
use tokio::fs::{File, ReadDir};
use tokio::io::{AsyncRead, ReadBuf};

/// Bytes handed to the engine per pull in file mode.
pub const FILE_CHUNK_SIZE: usize = 32 * 1024;

/// Streams the bytes of one regular file.
///
/// Reads sequentially in [`FILE_CHUNK_SIZE`] chunks; the size hint stays
/// exact as the stream advances, so the engine declares a Content-Length
/// equal to the file's byte length taken from metadata at open time.
pub struct FileStream {
    file: File,
    remaining: u64,
    buf: Vec<u8>,
}

impl FileStream {
    /// Wrap an open regular file whose metadata reported `len` bytes.
    pub fn new(file: File, len: u64) -> Self {
        Self {
            file,
            remaining: len,
            buf: vec![0; FILE_CHUNK_SIZE],
        }
    }
}

impl Body for FileStream {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let mut read_buf = ReadBuf::new(&mut this.buf);
        match Pin::new(&mut this.file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Ok(())) => {
                let filled = read_buf.filled();
                if filled.is_empty() {
                    // Physical EOF
                    Poll::Ready(None)
                } else {
                    this.remaining = this.remaining.saturating_sub(filled.len() as u64);
                    Poll::Ready(Some(Ok(Frame::data(Bytes::copy_from_slice(filled)))))
                }
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

/// Streams an HTML listing of the root directory, one entry per frame.
///
/// Dot-entries are skipped by scanning forward. Every frame is a complete
/// formatted fragment, so entries are never truncated across pulls; the
/// directory cursor only advances when a fragment is produced.
pub struct DirListing {
    entries: ReadDir,
}

impl DirListing {
    pub const fn new(entries: ReadDir) -> Self {
        Self { entries }
    }
}

impl Body for DirListing {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        loop {
            match this.entries.poll_next_entry(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => return Poll::Ready(Some(Err(e))),
                // Iteration exhausted: end of stream
                Poll::Ready(Ok(None)) => return Poll::Ready(None),
                Poll::Ready(Ok(Some(entry))) => {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if name.starts_with('.') {
                        continue;
                    }
                    let fragment = format_entry(&name);
                    return Poll::Ready(Some(Ok(Frame::data(Bytes::from(fragment)))));
                }
            }
        }
    }
}

/// One listing fragment per visible entry.
pub fn format_entry(name: &str) -> String {
    format!("<a href=\"/{name}\">{name}</a><br>")
}

/// Unified body type for every response the server produces.
pub enum ResponseBody {
    File(FileStream),
    Listing(DirListing),
    Full(Full<Bytes>),
}

impl ResponseBody {
    pub fn full(data: Bytes) -> Self {
        Self::Full(Full::new(data))
    }
}

impl Body for ResponseBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::File(body) => Pin::new(body).poll_frame(cx),
            Self::Listing(body) => Pin::new(body).poll_frame(cx),
            Self::Full(body) => Pin::new(body)
                .poll_frame(cx)
                .map(|frame| frame.map(|result| result.map_err(io::Error::other))),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::File(body) => body.is_end_stream(),
            Self::Listing(body) => body.is_end_stream(),
            Self::Full(body) => body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::File(body) => body.size_hint(),
            Self::Listing(body) => body.size_hint(),
            Self::Full(body) => body.size_hint(),
        }
    }
}
