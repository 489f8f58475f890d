//! 远程 URL → 本地路径

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, AppResult};

/// 将存储 URL 映射到本地镜像中的文件
///
/// 去掉 `remote_base_url` 前缀，百分号解码剩余部分，再拼接到 `local_base` 之后。
/// 纯函数，不访问文件系统。
pub fn resolve(local_base: &Path, remote_base_url: &str, remote_url: &str) -> AppResult<PathBuf> {
    let invalid = || AppError::InvalidUrl {
        url: remote_url.to_string(),
        expected_prefix: remote_base_url.to_string(),
    };

    let rest = remote_url.strip_prefix(remote_base_url).ok_or_else(invalid)?;
    let decoded = percent_decode_str(rest).decode_utf8_lossy();
    let relative = Path::new(decoded.trim_start_matches('/'));

    // 解码后的 `..` 会逃出本地镜像目录
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(invalid());
    }

    Ok(local_base.join(relative))
}

/// 持有某一资源的两个前缀
#[derive(Debug, Clone)]
pub struct PathMapper {
    local_base: PathBuf,
    remote_base_url: String,
}

impl PathMapper {
    pub fn new(local_base: impl Into<PathBuf>, remote_base_url: impl Into<String>) -> Self {
        Self {
            local_base: local_base.into(),
            remote_base_url: remote_base_url.into(),
        }
    }

    pub fn resolve(&self, remote_url: &str) -> AppResult<PathBuf> {
        resolve(&self.local_base, &self.remote_base_url, remote_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_and_decodes() {
        let path = resolve(
            Path::new("/data"),
            "https://x/edictos/",
            "https://x/edictos/2024%2Ffoo.pdf",
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/2024/foo.pdf"));
    }

    #[test]
    fn prefix_without_trailing_slash() {
        let path = resolve(
            Path::new("/data"),
            "https://x/edictos",
            "https://x/edictos/Torre%C3%B3n/2024/a%20b.pdf",
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/data/Torreón/2024/a b.pdf"));
    }

    #[test]
    fn mismatched_prefix_is_invalid_url() {
        let err = resolve(Path::new("/data"), "https://x/edictos/", "https://y/a.pdf").unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[test]
    fn parent_components_are_rejected() {
        let err = resolve(
            Path::new("/data"),
            "https://x/edictos/",
            "https://x/edictos/..%2F..%2Fetc%2Fpasswd",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[test]
    fn mapper_uses_its_prefixes() {
        let mapper = PathMapper::new("/srv/sentencias", "https://g/sentencias/");
        let path = mapper.resolve("https://g/sentencias/a.pdf").unwrap();
        assert_eq!(path, PathBuf::from("/srv/sentencias/a.pdf"));
    }
}
