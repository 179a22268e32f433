use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write the diagram to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> io::Result<()> {
    match path {
        Some(path) => write_bytes_atomic(path, data),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()
        }
    }
}

/// Write through a sibling temp file and rename, so readers never see a
/// partial diagram.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid output path: {}", path.display()),
        )
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
