use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, TimeDelta};
use rayon::prelude::*;

use crate::logging;

/// 預設單檔最大大小：10 MB
const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;
/// 預設保留天數：7 天
const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// 依日期與大小輪轉的日誌檔寫入器。
///
/// 檔名由 `pattern` 以 chrono 格式化產生，例如 `log/%Y-%m-%d-default.log`。
/// 同一天內檔案超過 `max_size` 時改寫到 `xxx.1.log`、`xxx.2.log`...
pub struct Rotate {
    pattern: String,
    /// 由日期決定的基礎檔名（不含 generation）
    base_name: String,
    current_name: PathBuf,
    out: Option<BufWriter<File>>,
    /// 世代編號，只增不減，換日時歸零
    generation: u32,
    max_size: u64,
    current_size: u64,
    max_age: TimeDelta,
}

impl Rotate {
    pub fn new(pattern: String) -> Self {
        Self::with_options(pattern, DEFAULT_MAX_SIZE, DEFAULT_MAX_AGE_DAYS)
    }

    pub fn with_options(pattern: String, max_size: u64, max_age_days: i64) -> Self {
        Rotate {
            pattern,
            base_name: String::new(),
            current_name: PathBuf::new(),
            out: None,
            generation: 0,
            max_size,
            current_size: 0,
            max_age: TimeDelta::try_days(max_age_days).unwrap_or(TimeDelta::days(7)),
        }
    }

    /// 寫入一段日誌，自動處理換日與大小輪轉
    pub fn write_msg(&mut self, now: DateTime<Local>, msg: &[u8]) -> Result<()> {
        self.ensure_file(now)?;

        if self.current_size > 0 && self.current_size + msg.len() as u64 > self.max_size {
            self.generation += 1;
            self.open_file()?;
        }

        let out = self
            .out
            .as_mut()
            .ok_or_else(|| anyhow!("log file {} is not open", self.current_name.display()))?;
        out.write_all(msg)?;
        self.current_size += msg.len() as u64;

        Ok(())
    }

    pub fn flush(&mut self) {
        if let Some(out) = self.out.as_mut() {
            let _ = out.flush();
        }
    }

    /// 目前寫入中的檔案
    pub fn current_file(&self) -> &Path {
        &self.current_name
    }

    fn ensure_file(&mut self, now: DateTime<Local>) -> Result<()> {
        let base_name = now.format(&self.pattern).to_string();
        if base_name == self.base_name && self.out.is_some() {
            return Ok(());
        }

        self.base_name = base_name;
        self.generation = 0;
        self.open_file()?;
        self.cleanup_old_files(now);

        Ok(())
    }

    fn open_file(&mut self) -> Result<()> {
        self.flush();

        let file_name = file_name(&self.base_name, self.generation);
        if let Some(parent) = file_name.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&file_name)?;
        self.current_size = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.out = Some(BufWriter::with_capacity(4096, file));
        self.current_name = file_name;

        Ok(())
    }

    /// 刪除同目錄下超過 `max_age` 的 .log 檔
    fn cleanup_old_files(&self, now: DateTime<Local>) {
        let parent = match self.current_name.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&parent) {
            Ok(entries) => entries,
            Err(why) => {
                logging::error_console(format!(
                    "Failed to read_dir({}) because {:?}",
                    parent.display(),
                    why
                ));
                return;
            }
        };

        let cut_off = (now - self.max_age).timestamp().max(0) as u64;
        let to_unlink: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "log"))
            .filter(|path| *path != self.current_name)
            .filter(|path| {
                fs::metadata(path)
                    .and_then(|metadata| metadata.modified())
                    .ok()
                    .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
                    .is_some_and(|duration| duration.as_secs() <= cut_off)
            })
            .collect();

        to_unlink
            .par_iter()
            .with_min_len(num_cpus::get())
            .for_each(|unlink| {
                if let Err(why) = fs::remove_file(unlink) {
                    logging::error_console(format!(
                        "couldn't remove the file({}). because {:?}",
                        unlink.display(),
                        why
                    ));
                }
            });
    }
}

impl Drop for Rotate {
    fn drop(&mut self) {
        self.flush();
    }
}

/// generation = 0: "log/2025-02-03-app.log"
/// generation = 1: "log/2025-02-03-app.1.log"
fn file_name(base_name: &str, generation: u32) -> PathBuf {
    if generation == 0 {
        return PathBuf::from(base_name);
    }

    let path = Path::new(base_name);
    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("log");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("log");

    parent.join(format!("{}.{}.{}", stem, generation, ext))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;

    fn pattern_in(dir: &Path, name: &str) -> String {
        format!("{}/%Y-%m-%d-{}.log", dir.display(), name)
    }

    #[test]
    fn test_generation_file_name() {
        let base = "log/2025-02-03-app.log";
        assert_eq!(file_name(base, 0), PathBuf::from("log/2025-02-03-app.log"));
        assert_eq!(file_name(base, 1), PathBuf::from("log/2025-02-03-app.1.log"));
        assert_eq!(file_name(base, 2), PathBuf::from("log/2025-02-03-app.2.log"));
    }

    #[test]
    fn test_basic_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = Rotate::new(pattern_in(dir.path(), "basic"));
        let now = Local::now();

        r.write_msg(now, b"first line\r\n").unwrap();
        r.flush();

        let expected = dir
            .path()
            .join(format!("{}-basic.log", now.format("%Y-%m-%d")));
        assert_eq!(r.current_file(), expected.as_path());
        assert_eq!(fs::read_to_string(expected).unwrap(), "first line\r\n");
    }

    #[test]
    fn test_size_rotation_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = Rotate::with_options(pattern_in(dir.path(), "size"), 64, 7);
        let now = Local::now();

        for i in 0..6 {
            let msg = format!("line {} {}\r\n", i, "X".repeat(20));
            r.write_msg(now, msg.as_bytes()).unwrap();
        }
        r.flush();

        assert!(r.generation >= 2);
        let day = now.format("%Y-%m-%d");
        assert!(dir.path().join(format!("{}-size.log", day)).exists());
        assert!(dir.path().join(format!("{}-size.1.log", day)).exists());

        let total: usize = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .map(|e| fs::read_to_string(e.path()).unwrap().lines().count())
            .sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_date_change_resets_generation() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = Rotate::with_options(pattern_in(dir.path(), "date"), 16, 7);
        let now = Local::now();

        r.write_msg(now, b"0123456789\r\n").unwrap();
        r.write_msg(now, b"0123456789\r\n").unwrap();
        assert_eq!(r.generation, 1);

        let tomorrow = now + TimeDelta::try_days(1).unwrap();
        r.write_msg(tomorrow, b"next day\r\n").unwrap();
        assert_eq!(r.generation, 0);
        assert!(r
            .current_file()
            .ends_with(format!("{}-date.log", tomorrow.format("%Y-%m-%d"))));
    }

    #[test]
    fn test_cleanup_removes_expired_files() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("2000-01-01-old.log");
        let keep = dir.path().join("notes.txt");
        fs::write(&stale, "old").unwrap();
        fs::write(&keep, "keep").unwrap();

        let month_ago = SystemTime::now() - Duration::from_secs(30 * 24 * 60 * 60);
        File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(month_ago)
            .unwrap();
        File::options()
            .write(true)
            .open(&keep)
            .unwrap()
            .set_modified(month_ago)
            .unwrap();

        let mut r = Rotate::new(pattern_in(dir.path(), "cleanup"));
        r.write_msg(Local::now(), b"hello\r\n").unwrap();

        assert!(!stale.exists());
        assert!(keep.exists());
    }
}
