//! GitHub platform service implementation

use crate::config::MergeMethod;
use crate::error::{Error, Result};
use crate::platform::GitHubApi;
use crate::types::{PullRequestData, RepoConfig};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

const PULL_REQUEST_ID_QUERY: &str = "query GetPullRequestId($owner: String!, $repo: String!, $pullRequestNumber: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $pullRequestNumber) {
      id
    }
  }
}";

const ENABLE_AUTO_MERGE_MUTATION: &str = "mutation ($pullRequestId: ID!, $mergeMethod: PullRequestMergeMethod!) {
  enablePullRequestAutoMerge(input: {pullRequestId: $pullRequestId, mergeMethod: $mergeMethod}) {
    pullRequest {
      autoMergeRequest {
        enabledAt
      }
    }
  }
}";

#[derive(Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Deserialize)]
struct Login {
    login: String,
}

#[derive(Deserialize)]
struct TeamSlug {
    slug: String,
}

#[derive(Deserialize)]
struct RequestedReviewers {
    #[serde(default)]
    requested_reviewers: Option<Vec<Login>>,
    #[serde(default)]
    requested_teams: Option<Vec<TeamSlug>>,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: RepoConfig,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` overrides the REST endpoint (GitHub Enterprise, tests).
    pub fn new(token: &str, config: RepoConfig, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}{path}", self.config.owner, self.config.repo)
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let response: Value = self
            .client
            .graphql(&json!({ "query": query, "variables": variables }))
            .await?;

        if let Some(errors) = response.get("errors") {
            return Err(Error::GitHubApi(format!("GraphQL error: {errors}")));
        }

        Ok(response)
    }
}

#[async_trait]
impl GitHubApi for GitHubService {
    async fn repo_default_branch(&self) -> Result<String> {
        let repo = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .get()
            .await?;

        repo.default_branch
            .ok_or_else(|| Error::GitHubApi("repository has no default branch".to_string()))
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool> {
        let route = self.route(&format!(
            "/git/matching-refs/heads/{}",
            urlencoding::encode(branch)
        ));
        let refs: Vec<GitRef> = self.client.get(route, None::<&()>).await?;

        let full_name = format!("refs/heads/{branch}");
        Ok(refs.iter().filter(|r| r.name == full_name).count() == 1)
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestData> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        debug!("Pull request number: {}", pr.number);

        Ok(PullRequestData {
            url: pr
                .html_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            number: pr.number,
        })
    }

    async fn request_reviewer(&self, pr_number: u64, reviewer: &str) -> Result<Vec<String>> {
        let route = self.route(&format!("/pulls/{pr_number}/requested_reviewers"));
        let response: RequestedReviewers = self
            .client
            .post(route, Some(&json!({ "reviewers": [reviewer] })))
            .await?;

        Ok(response
            .requested_reviewers
            .unwrap_or_default()
            .into_iter()
            .map(|u| u.login)
            .collect())
    }

    async fn request_team_reviewer(&self, pr_number: u64, team: &str) -> Result<Vec<String>> {
        let route = self.route(&format!("/pulls/{pr_number}/requested_reviewers"));
        let response: RequestedReviewers = self
            .client
            .post(route, Some(&json!({ "team_reviewers": [team] })))
            .await?;

        Ok(response
            .requested_teams
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.slug)
            .collect())
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, labels)
            .await?;
        Ok(())
    }

    async fn label_exists(&self, name: &str) -> Result<bool> {
        match self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .get_label(name)
            .await
        {
            Ok(label) => {
                debug!("Label {name} already exists with id: {}", label.id.0);
                Ok(true)
            }
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                debug!("Label {name} not found");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_label(&self, name: &str, color: &str, description: &str) -> Result<()> {
        let label = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .create_label(name, color, description)
            .await?;
        debug!("Created label {name} with id: {}", label.id.0);
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        let comment = self
            .client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!("Created comment for PR {pr_number} with id: {}", comment.id.0);
        Ok(())
    }

    async fn enable_auto_merge(&self, pr_number: u64, method: MergeMethod) -> Result<()> {
        let response = self
            .graphql(
                PULL_REQUEST_ID_QUERY,
                json!({
                    "owner": self.config.owner,
                    "repo": self.config.repo,
                    "pullRequestNumber": pr_number,
                }),
            )
            .await?;

        let pr_id = response
            .pointer("/data/repository/pullRequest/id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::GitHubApi(format!("pull request {pr_number} not found")))?
            .to_string();
        debug!("PR #{pr_number} -> node id {pr_id}");

        let result = self
            .graphql(
                ENABLE_AUTO_MERGE_MUTATION,
                json!({ "pullRequestId": pr_id, "mergeMethod": method.as_graphql() }),
            )
            .await?;
        debug!("enablePullRequestAutoMerge: {result}");

        Ok(())
    }
}
