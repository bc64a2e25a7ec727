//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and under the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! Test suites go through `cap_std::fs::Dir` like the adapters do, so
    //! seeding and inspecting data files follows the same access policy.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salon_crm::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("crm-cap-fs-read-example.txt");
    /// write_file(&path, b"hello\n")?;
    ///
    /// let content = read_file_to_string(&path)?;
    /// assert_eq!(content, "hello\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Read raw bytes through `cap_std`.
    pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`, replacing any existing file.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Names of the entries in `path`, sorted.
    pub fn list_file_names(path: &Path) -> io::Result<Vec<String>> {
        let directory = Dir::open_ambient_dir(path, ambient_authority())?;
        let mut names = directory
            .entries()?
            .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod clock {
    //! Deterministic clocks.

    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;

    /// Clock frozen at a fixed UTC instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl FixtureClock {
        /// Clock stopped at `utc_now`.
        #[must_use]
        pub const fn new(utc_now: DateTime<Utc>) -> Self {
            Self { utc_now }
        }

        /// Midday UTC on 2025-02-01, which is the same calendar date in every
        /// timezone within eleven hours of UTC.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use mockable::Clock;
        /// use salon_crm::test_support::clock::FixtureClock;
        ///
        /// let clock = FixtureClock::february_first();
        /// assert_eq!(clock.utc().date_naive().to_string(), "2025-02-01");
        /// ```
        #[must_use]
        pub fn february_first() -> Self {
            let utc_now = Utc
                .with_ymd_and_hms(2025, 2, 1, 12, 0, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            Self::new(utc_now)
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }
}

pub mod data_dir {
    //! Temporary data directories for JSON store tests.

    use std::io;
    use std::sync::Arc;

    use camino::Utf8Path;
    use cap_std::fs::Dir;
    use tempfile::TempDir;

    use crate::outbound::persistence::open_data_dir;

    /// Open `temp` as a capability-scoped data directory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use salon_crm::test_support::data_dir::open_temp_data_dir;
    ///
    /// let temp = tempfile::TempDir::new()?;
    /// let dir = open_temp_data_dir(&temp)?;
    /// assert!(dir.entries()?.next().is_none());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn open_temp_data_dir(temp: &TempDir) -> io::Result<Arc<Dir>> {
        let path = Utf8Path::from_path(temp.path()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "temporary directory path must be UTF-8",
            )
        })?;
        open_data_dir(path).map(Arc::new)
    }
}
