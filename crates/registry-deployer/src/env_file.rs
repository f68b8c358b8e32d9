//! Persists a single `KEY=VALUE` entry into a dotenv style file while keeping
//! the other entries intact.

use {
    regex::Regex,
    std::{
        io,
        path::{Path, PathBuf},
    },
    tokio::fs,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid environment key {0:?}")]
    InvalidKey(String),
    #[error("failed to read environment file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write environment file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An environment file on disk together with the key this tool owns in it.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    key: String,
    entry: Regex,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>, key: &str) -> Result<Self, Error> {
        if key.is_empty() || key.contains(['=', '\n', '\r']) {
            return Err(Error::InvalidKey(key.to_owned()));
        }
        // Not anchored to the start of a line: `KEY=` anywhere on a line
        // removes the rest of that line.
        let entry = Regex::new(&format!(
            "{}=[^\\n\\r\\x{{2028}}\\x{{2029}}]*",
            regex::escape(key)
        ))
        .map_err(|_| Error::InvalidKey(key.to_owned()))?;

        Ok(Self {
            path: path.into(),
            key: key.to_owned(),
            entry,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the current contents. A missing file reads as empty and invalid
    /// UTF-8 is replaced rather than rejected.
    pub async fn read(&self) -> Result<String, Error> {
        match fs::read(&self.path).await {
            Ok(contents) => Ok(String::from_utf8_lossy(&contents).into_owned()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(Error::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Returns `contents` with every entry for the key stripped and exactly one
    /// `KEY=value` line appended.
    pub fn render(&self, contents: &str, value: &str) -> String {
        let stripped = self.entry.replace_all(contents, "");
        let rest = stripped.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if rest.is_empty() {
            format!("{}={value}\n", self.key)
        } else {
            format!("{rest}\n{}={value}\n", self.key)
        }
    }

    /// Rewrites the whole file so that it holds `value` under the key.
    pub async fn write_entry(&self, value: &str) -> Result<(), Error> {
        let contents = self.read().await?;
        let updated = self.render(&contents, value);
        fs::write(&self.path, updated)
            .await
            .map_err(|source| Error::Write {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = ?self.path, key = %self.key, "updated environment file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_env(path: impl Into<PathBuf>) -> EnvFile {
        EnvFile::new(path, "REGISTRY_ADDR").unwrap()
    }

    #[test]
    fn renders_single_entry_for_empty_contents() {
        let env = registry_env(".env");
        assert_eq!(env.render("", "0xABC"), "REGISTRY_ADDR=0xABC\n");
        assert_eq!(env.render(" \n\n\t", "0xABC"), "REGISTRY_ADDR=0xABC\n");
    }

    #[test]
    fn replaces_previous_entry_and_keeps_others() {
        let env = registry_env(".env");
        assert_eq!(
            env.render("FOO=bar\nREGISTRY_ADDR=0xOLD\n", "0xNEW"),
            "FOO=bar\nREGISTRY_ADDR=0xNEW\n"
        );
    }

    #[test]
    fn removes_every_stray_entry() {
        let env = registry_env(".env");
        let rendered = env.render(
            "REGISTRY_ADDR=0x1\nFOO=bar\nREGISTRY_ADDR=0x2\nBAZ=qux\nREGISTRY_ADDR=0x3",
            "0xNEW",
        );
        assert_eq!(
            rendered
                .lines()
                .filter(|line| line.contains("REGISTRY_ADDR="))
                .collect::<Vec<_>>(),
            ["REGISTRY_ADDR=0xNEW"]
        );
        assert!(rendered.contains("FOO=bar\n"));
        assert!(rendered.contains("BAZ=qux\n"));
        assert!(rendered.ends_with("REGISTRY_ADDR=0xNEW\n"));
    }

    #[test]
    fn interior_blank_lines_are_kept() {
        let env = registry_env(".env");
        assert_eq!(
            env.render("\n\nFOO=bar\nREGISTRY_ADDR=0xOLD\nBAZ=qux\n\n", "0xNEW"),
            "FOO=bar\n\nBAZ=qux\nREGISTRY_ADDR=0xNEW\n"
        );
    }

    #[test]
    fn match_is_not_anchored_to_line_start() {
        let env = registry_env(".env");
        assert_eq!(
            env.render("FOO=bar # was REGISTRY_ADDR=0xOLD\n", "0xNEW"),
            "FOO=bar # was\nREGISTRY_ADDR=0xNEW\n"
        );
    }

    #[test]
    fn match_is_case_sensitive() {
        let env = registry_env(".env");
        assert_eq!(
            env.render("registry_addr=0xlower\n", "0xNEW"),
            "registry_addr=0xlower\nREGISTRY_ADDR=0xNEW\n"
        );
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        let env = registry_env(".env");
        assert_eq!(
            env.render("\u{feff}FOO=bar\nREGISTRY_ADDR=0xOLD\n", "0xNEW"),
            "FOO=bar\nREGISTRY_ADDR=0xNEW\n"
        );
    }

    #[test]
    fn key_is_matched_literally() {
        let env = EnvFile::new(".env", "A.B").unwrap();
        assert_eq!(env.render("AxB=keep\nA.B=drop\n", "1"), "AxB=keep\nA.B=1\n");
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in ["", "A=B", "A\nB"] {
            assert!(matches!(
                EnvFile::new(".env", key),
                Err(Error::InvalidKey(_))
            ));
        }
    }

    #[tokio::test]
    async fn creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let env = registry_env(dir.path().join(".env"));

        assert_eq!(env.read().await.unwrap(), "");
        env.write_entry("0xABC").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(env.path()).unwrap(),
            "REGISTRY_ADDR=0xABC\n"
        );
    }

    #[tokio::test]
    async fn repeated_writes_keep_latest_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "RPC_URL=http://localhost:8545\n").unwrap();
        let env = registry_env(&path);

        env.write_entry("0x1").await.unwrap();
        env.write_entry("0x2").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "RPC_URL=http://localhost:8545\nREGISTRY_ADDR=0x2\n"
        );
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, b"FOO=\xff\xfe\nREGISTRY_ADDR=0xOLD\n").unwrap();
        let env = registry_env(&path);

        env.write_entry("0xNEW").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "FOO=\u{fffd}\u{fffd}\nREGISTRY_ADDR=0xNEW\n"
        );
    }

    #[tokio::test]
    async fn read_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory can't be read as a file.
        let env = registry_env(dir.path());

        assert!(matches!(env.read().await, Err(Error::Read { .. })));
        assert!(matches!(
            env.write_entry("0x1").await,
            Err(Error::Read { .. })
        ));
    }
}
