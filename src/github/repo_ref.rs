use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::RepoRef;

static RE_REPO_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").unwrap());

/// Pulls `(owner, repo)` out of a GitHub URL.
///
/// Trailing slashes are stripped from the repository name and every `.git`
/// occurrence is removed. URLs without an owner/repo path give `None`.
pub fn parse_repo_ref(url: &str) -> Option<RepoRef> {
    let caps = RE_REPO_PATH.captures(url)?;
    let owner = caps.get(1)?.as_str();
    let repo = caps
        .get(2)?
        .as_str()
        .trim_end_matches('/')
        .replace(".git", "");

    if repo.is_empty() {
        return None;
    }

    Some(RepoRef::new(owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_repo_url() {
        assert_eq!(
            parse_repo_ref("https://github.com/modal-projects/gh-issues-agent"),
            Some(RepoRef::new("modal-projects", "gh-issues-agent"))
        );
    }

    #[test]
    fn test_git_suffix_and_trailing_slash() {
        assert_eq!(
            parse_repo_ref("https://github.com/foo/bar.git/"),
            Some(RepoRef::new("foo", "bar"))
        );
        assert_eq!(
            parse_repo_ref("https://github.com/foo/bar.git"),
            Some(RepoRef::new("foo", "bar"))
        );
    }

    #[test]
    fn test_deep_links_keep_repo() {
        assert_eq!(
            parse_repo_ref("https://github.com/openai/whisper/tree/main/whisper"),
            Some(RepoRef::new("openai", "whisper"))
        );
    }

    #[test]
    fn test_git_removed_anywhere_in_name() {
        assert_eq!(
            parse_repo_ref("https://github.com/user/user.github.io"),
            Some(RepoRef::new("user", "userhub.io"))
        );
    }

    #[test]
    fn test_non_github_urls() {
        assert_eq!(parse_repo_ref("https://gitlab.com/foo/bar"), None);
        assert_eq!(parse_repo_ref("https://github.com/foo"), None);
        assert_eq!(parse_repo_ref("https://github.com/foo/.git"), None);
        assert_eq!(parse_repo_ref("not a url"), None);
    }
}
