use std::ffi::CString;
use std::vec::Vec;

/// Allocates a buffer of `len` spaces for OpenGL to write an info log into.
///
/// The driver reports the log length *including* the trailing NUL, so `len` can be passed straight
/// from `GL_INFO_LOG_LENGTH`.
pub fn info_log_buffer(len: usize) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::with_capacity(len + 1);
    buf.extend([b' '].iter().cycle().take(len)); // Adds a bunch of spaces to the buffer
    buf
}

/// Turns the first `written` bytes of an info log buffer into a `String`, dropping the trailing
/// NUL and whitespace drivers like to leave behind.
pub fn info_log_to_string(mut buf: Vec<u8>, written: usize) -> String {
    buf.truncate(written.min(buf.len()));
    String::from_utf8_lossy(&buf)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_owned()
}

/// Uniform names are passed to the driver as C strings. Returns `None` for names with an
/// interior NUL, which can never match anything in a shader.
pub fn uniform_name(name: &str) -> Option<CString> {
    CString::new(name).ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn info_log_trims_nul_and_trailing_whitespace() {
        let mut buf = info_log_buffer(8);
        buf[..5].copy_from_slice(b"oops\n");
        buf[5] = 0;
        assert_eq!(info_log_to_string(buf, 6), "oops");
    }

    #[test]
    fn info_log_never_reads_past_the_buffer() {
        let buf = info_log_buffer(3);
        assert_eq!(info_log_to_string(buf, 10), "");
    }

    #[test]
    fn uniform_names_with_nul_are_rejected() {
        assert!(uniform_name("u_time").is_some());
        assert!(uniform_name("u_\0time").is_none());
    }
}
