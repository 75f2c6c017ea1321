// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push orchestration service.
//!
//! Handles the core workflow:
//! 1. Load and decrypt the stored credential
//! 2. Reject implausibly short code (before any network call)
//! 3. Build the file path and metadata header
//! 4. Resolve or create the solutions repository
//! 5. Upsert the file
//! 6. Update user stats, only after GitHub confirmed the write

use crate::db::LocalStore;
use crate::error::{AppError, Result, UNKNOWN_ERROR};
use crate::models::SubmissionEvent;
use crate::services::cipher::TokenCipher;
use crate::services::github::{GitHubClient, PutFileRequest, PutFileResponse, RepoLookup};
use crate::time_utils::format_utc_date;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};

/// Minimum code length accepted for a push.
pub const MIN_PUSH_CODE_CHARS: usize = 50;

/// Folder inside the repository that holds every solution.
pub const SOLUTIONS_DIR: &str = "solutions";

/// Branch written to; `auto_init` creates it on new repositories.
pub const DEFAULT_BRANCH: &str = "main";

/// Description set on a freshly created repository.
const REPO_DESCRIPTION: &str = "LeetCode solutions pushed by the LeetCode Auto-Push extension.";

/// File extension and line-comment prefix for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub ext: &'static str,
    pub comment: &'static str,
}

const LANGUAGES: &[(&str, LanguageInfo)] = &[
    ("python3", LanguageInfo { ext: "py", comment: "#" }),
    ("python", LanguageInfo { ext: "py", comment: "#" }),
    ("cpp", LanguageInfo { ext: "cpp", comment: "//" }),
    ("java", LanguageInfo { ext: "java", comment: "//" }),
    ("javascript", LanguageInfo { ext: "js", comment: "//" }),
    ("typescript", LanguageInfo { ext: "ts", comment: "//" }),
    ("c", LanguageInfo { ext: "c", comment: "//" }),
    ("csharp", LanguageInfo { ext: "cs", comment: "//" }),
    ("ruby", LanguageInfo { ext: "rb", comment: "#" }),
    ("go", LanguageInfo { ext: "go", comment: "//" }),
    ("rust", LanguageInfo { ext: "rs", comment: "//" }),
    ("kotlin", LanguageInfo { ext: "kt", comment: "//" }),
    ("swift", LanguageInfo { ext: "swift", comment: "//" }),
];

/// Look up a language, guessing the extension from the code when the name
/// is unknown: a `def ` token means `.py`, anything else `.cpp`. Unknown
/// languages always get a `//` header comment.
pub fn language_info(language: &str, code: &str) -> LanguageInfo {
    let language = language.trim().to_ascii_lowercase();
    if let Some((_, info)) = LANGUAGES.iter().find(|(name, _)| *name == language) {
        return *info;
    }
    LanguageInfo {
        ext: if code.contains("def ") { "py" } else { "cpp" },
        comment: "//",
    }
}

/// `solutions/<slug>.<ext>`, where every character of the lower-cased title
/// outside `[a-z0-9]` becomes one `-`. Runs of hyphens are kept.
pub fn solution_path(problem_title: &str, ext: &str) -> String {
    let slug: String = problem_title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}/{}.{}", SOLUTIONS_DIR, slug, ext)
}

/// Metadata header as comment lines, a blank line, then the code with
/// line endings normalized to `\n`.
pub fn render_solution_file(
    event: &SubmissionEvent,
    info: LanguageInfo,
    now: DateTime<Utc>,
) -> String {
    let c = info.comment;
    let difficulty = if event.difficulty.is_empty() {
        crate::models::submission::DEFAULT_DIFFICULTY
    } else {
        event.difficulty.as_str()
    };
    format!(
        "{c} LeetCode Problem: {title}\n{c} Difficulty: {difficulty}\n{c} Pushed on: {date}\n\n{code}",
        title = event.problem_title,
        date = format_utc_date(now),
        code = normalize_line_endings(&event.code),
    )
}

fn normalize_line_endings(code: &str) -> String {
    code.replace("\r\n", "\n").replace('\r', "\n")
}

/// Result of a confirmed push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// Deep link to the solutions folder
    pub repo_url: String,
    /// Path of the written file inside the repository
    pub path: String,
}

/// Pushes accepted submissions to the user's solutions repository.
#[derive(Clone)]
pub struct PushOrchestrator {
    store: LocalStore,
    github: GitHubClient,
    repo_name: String,
    github_web_url: String,
}

impl PushOrchestrator {
    pub fn new(
        store: LocalStore,
        github: GitHubClient,
        repo_name: String,
        github_web_url: String,
    ) -> Self {
        Self {
            store,
            github,
            repo_name,
            github_web_url: github_web_url.trim_end_matches('/').to_string(),
        }
    }

    /// Push one submission.
    ///
    /// No stats are touched unless GitHub confirms the write. If the stats
    /// write itself fails afterwards, the pushed file stays.
    pub async fn push(&self, event: &SubmissionEvent) -> Result<PushOutcome> {
        // 1. Credentials
        let creds = self
            .store
            .get_credentials()
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        // 2. Decrypt
        let token = TokenCipher::from_base64_key(&creds.encryption_key)?
            .decrypt(&creds.encrypted_token, &creds.iv)?;

        // 3. Length check
        if event.code.chars().count() < MIN_PUSH_CODE_CHARS {
            tracing::info!(
                problem = %event.problem_title,
                len = event.code.chars().count(),
                "Rejecting push: code too short"
            );
            return Err(AppError::ContentTooShort);
        }

        // 4. Path and payload
        let now = Utc::now();
        let info = language_info(&event.language, &event.code);
        let path = solution_path(&event.problem_title, info.ext);
        let body = render_solution_file(event, info, now);

        tracing::info!(
            user = %creds.username,
            problem = %event.problem_title,
            path = %path,
            "Pushing solution"
        );

        // 5. Repository
        self.ensure_repo(&token, &creds.username).await?;

        // 6. File
        let request = PutFileRequest {
            message: format!("Add solution for {}", event.problem_title),
            content: BASE64.encode(body.as_bytes()),
            branch: DEFAULT_BRANCH.to_string(),
            sha: None,
        };
        self.upsert_file(&token, &creds.username, &path, request)
            .await?;

        // 7. Stats
        let mut stats = self
            .store
            .get_user_stats(&creds.username)
            .await?
            .unwrap_or_default();
        stats.record_push(&event.difficulty, now);
        self.store.put_user_stats(&creds.username, &stats).await?;

        tracing::info!(
            user = %creds.username,
            push_count = stats.push_count,
            "Push recorded"
        );

        Ok(PushOutcome {
            repo_url: format!(
                "{}/{}/{}/tree/{}/{}",
                self.github_web_url, creds.username, self.repo_name, DEFAULT_BRANCH, SOLUTIONS_DIR
            ),
            path,
        })
    }

    /// Fetch the repository by name, creating it on 404.
    async fn ensure_repo(&self, token: &str, owner: &str) -> Result<()> {
        let lookup = self
            .github
            .get_repo(token, owner, &self.repo_name)
            .await
            .map_err(|e| AppError::RepoAccess(e.to_string()))?;

        let repo = match lookup {
            RepoLookup::Found(repo) => repo,
            RepoLookup::NotFound => {
                tracing::info!(owner, repo = %self.repo_name, "Creating solutions repository");
                self.github
                    .create_repo(token, &self.repo_name, REPO_DESCRIPTION)
                    .await
                    .map_err(|e| AppError::RepoAccess(e.to_string()))?
            }
        };

        if repo.id.is_none() {
            return Err(AppError::RepoAccess(
                repo.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }
        tracing::debug!(url = repo.html_url.as_deref().unwrap_or(""), "Repository ready");
        Ok(())
    }

    /// Write the file; on a 422 for an existing file, repeat once with its sha.
    async fn upsert_file(
        &self,
        token: &str,
        owner: &str,
        path: &str,
        mut request: PutFileRequest,
    ) -> Result<()> {
        let (status, response) = self.put_file(token, owner, path, &request).await?;
        if response.content.is_some() {
            return Ok(());
        }

        if status == 422 {
            let sha = self
                .github
                .get_file_sha(token, owner, &self.repo_name, path, DEFAULT_BRANCH)
                .await
                .map_err(|e| AppError::PushFailed(e.to_string()))?;

            if let Some(sha) = sha {
                tracing::debug!(path, "File exists, overwriting with current sha");
                request.sha = Some(sha);
                let (_, retried) = self.put_file(token, owner, path, &request).await?;
                if retried.content.is_some() {
                    return Ok(());
                }
                return Err(push_failed(retried.message));
            }
        }

        Err(push_failed(response.message))
    }

    async fn put_file(
        &self,
        token: &str,
        owner: &str,
        path: &str,
        request: &PutFileRequest,
    ) -> Result<(u16, PutFileResponse)> {
        self.github
            .put_file(token, owner, &self.repo_name, path, request)
            .await
            .map_err(|e| AppError::PushFailed(e.to_string()))
    }
}

fn push_failed(message: Option<String>) -> AppError {
    AppError::PushFailed(message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(title: &str, language: &str, code: &str) -> SubmissionEvent {
        SubmissionEvent {
            problem_title: title.to_string(),
            code: code.to_string(),
            language: language.to_string(),
            difficulty: "Easy".to_string(),
        }
    }

    #[test]
    fn test_solution_path_keeps_hyphen_runs() {
        assert_eq!(solution_path("Two Sum!!", "py"), "solutions/two-sum--.py");
        assert_eq!(
            solution_path("1. Two Sum", "cpp"),
            "solutions/1--two-sum.cpp"
        );
        assert_eq!(solution_path("Café", "go"), "solutions/caf-.go");
    }

    #[test]
    fn test_language_table_and_fallback() {
        assert_eq!(language_info("python3", "").ext, "py");
        assert_eq!(language_info("Java", "").comment, "//");
        assert_eq!(language_info("ruby", "").comment, "#");

        let guessed = language_info("unknown", "def twoSum(self):\n    pass");
        assert_eq!(guessed, LanguageInfo { ext: "py", comment: "//" });

        let guessed = language_info("unknown", "int main() { return 0; }");
        assert_eq!(guessed, LanguageInfo { ext: "cpp", comment: "//" });
    }

    #[test]
    fn test_render_solution_file_header() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let e = event("Two Sum", "python3", "class Solution:\r\n    pass");
        let rendered = render_solution_file(&e, language_info("python3", ""), now);

        assert_eq!(
            rendered,
            "# LeetCode Problem: Two Sum\n# Difficulty: Easy\n# Pushed on: 2024-05-02\n\nclass Solution:\n    pass"
        );
    }
}
