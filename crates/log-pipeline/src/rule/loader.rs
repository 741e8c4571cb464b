//! 프로파일 파일 로더 -- YAML 프로파일을 디스크에서 로드합니다.

use std::path::Path;

use crate::error::LogPipelineError;

use super::LogProfile;
use super::types::ProfileDefinition;

/// 프로파일 파일 최대 크기
const MAX_PROFILE_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// 프로파일 파일 로더
pub struct ProfileLoader;

impl ProfileLoader {
    /// 단일 YAML 파일에서 프로파일을 로드하고 컴파일합니다.
    ///
    /// # Errors
    /// - 파일을 읽을 수 없거나 크기 제한을 초과하는 경우 [`LogPipelineError::ProfileLoad`]
    /// - YAML 파싱 실패 시 [`LogPipelineError::ProfileLoad`]
    /// - 컴파일/검증 실패 시 [`LogPipelineError::ProfileValidation`]
    pub async fn load_file(path: impl AsRef<Path>) -> Result<LogProfile, LogPipelineError> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| LogPipelineError::ProfileLoad {
                path: path.display().to_string(),
                reason: format!("failed to read file metadata: {e}"),
            })?;

        if metadata.len() > MAX_PROFILE_FILE_SIZE {
            return Err(LogPipelineError::ProfileLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_PROFILE_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| LogPipelineError::ProfileLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        let profile = Self::parse_yaml(&content, &path.display().to_string())?;

        tracing::info!(
            path = %path.display(),
            profile = %profile.name(),
            rules = profile.rules().len(),
            "loaded log profile"
        );

        Ok(profile)
    }

    /// YAML 문자열을 파싱하여 프로파일을 생성합니다.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<LogProfile, LogPipelineError> {
        let definition: ProfileDefinition =
            serde_yaml::from_str(yaml_str).map_err(|e| LogPipelineError::ProfileLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        LogProfile::compile(definition)
    }

    /// 프로파일 정의를 YAML로 직렬화합니다.
    pub fn to_yaml(profile: &LogProfile) -> Result<String, LogPipelineError> {
        serde_yaml::to_string(profile.definition()).map_err(|e| LogPipelineError::ProfileLoad {
            path: profile.name().to_owned(),
            reason: format!("YAML serialize error: {e}"),
        })
    }
}
