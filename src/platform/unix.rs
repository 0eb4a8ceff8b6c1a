use std::fs::File;
use std::io;
use std::os::fd::{FromRawFd, OwnedFd};
use std::process::Stdio;

use log::debug;

/// A pipe whose write end is handed to the child twice, once as stdout and
/// once as stderr, so both streams land in one buffer in the order the
/// child wrote them.
pub struct MergedPipe {
    /// Read end, kept by the parent
    pub reader: File,
    pub stdout: Stdio,
    pub stderr: Stdio,
}

/// Create a close-on-exec pipe and split its write end into stdout/stderr
pub fn merged_pipe() -> io::Result<MergedPipe> {
    let (reader, writer) = cloexec_pipe()?;
    let writer_dup = writer.try_clone()?;

    Ok(MergedPipe {
        reader: File::from(reader),
        stdout: Stdio::from(writer),
        stderr: Stdio::from(writer_dup),
    })
}

/// Both ends must be close-on-exec from the moment they exist: a child
/// spawned concurrently by another thread would otherwise inherit the write
/// end and hold our reader open until it exits.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
    target_os = "illumos",
    target_os = "solaris",
))]
fn cloexec_pipe() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut fds = [0 as libc::c_int; 2];

    unsafe {
        if libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    debug!("Created merged output pipe (read fd {}, write fd {})", fds[0], fds[1]);

    Ok(unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) })
}

/// No `pipe2` here (macOS): flag each end right after creation
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
    target_os = "illumos",
    target_os = "solaris",
)))]
fn cloexec_pipe() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut fds = [0 as libc::c_int; 2];

    unsafe {
        if libc::pipe(fds.as_mut_ptr()) < 0 {
            return Err(io::Error::last_os_error());
        }
    }

    // Take ownership right away so both ends are closed on every error path
    let ends = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
    for fd in fds {
        set_cloexec(fd)?;
    }
    debug!("Created merged output pipe (read fd {}, write fd {})", fds[0], fds[1]);

    Ok(ends)
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
    target_os = "illumos",
    target_os = "solaris",
)))]
fn set_cloexec(fd: libc::c_int) -> io::Result<()> {
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFD);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFD, flags | libc::FD_CLOEXEC) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}
