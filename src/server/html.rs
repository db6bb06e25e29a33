//! go-get discovery page
//!
//! The `go-import` and `go-source` meta tags are read by the go tool; the
//! `{/dir}`, `{file}` and `{line}` placeholders are filled in by the client.

use crate::repo::Repository;

/// Renders the page served for `?go-get=1` requests.
pub fn render_go_get(repo: &Repository<'_>) -> String {
    let vanity_path = repo.vanity_path();
    let repo_url = repo.repo_root_url();
    let tree = repo.git_tree();

    format!(
        r#"
<html>
<head>
<meta name="go-import" content="{vanity_path} git {vanity_url}">
<meta name="go-source" content="{vanity_path} _ {repo_url}/tree/{tree}{{/dir}} {repo_url}/blob/{tree}{{/dir}}/{{file}}#L{{line}}">
</head>
<body>
go get {vanity_path}
</body>
</html>
"#,
        vanity_url = repo.vanity_url(),
    )
}
