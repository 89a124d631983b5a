// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Submission state machine.
//!
//! ```text
//! submit   feature -> QA review (open once, then reuse)
//!          for commit in review: for diff in commit:
//!              seen (path, diff)?  skip
//!              else read_file(feature) -> artifacts.save_file -> push version
//!          submission_count += 1
//! approve  QA -> MAIN review (reuse open one), merge, deploy, delete record
//! reject   collect review commits, revert on server, delete record
//! ```
//!
//! All of these hold the `(app, module)` lock for their whole duration.

use tracing::{debug, info, warn};

use super::{Engine, default_binding, module_key};
use crate::error::{ZeedasResult, bad_input};
use crate::model::branch::{MAIN_BRANCH, QA_BRANCH, feature_branch, submission_title};
use crate::model::{DiffVersion, ReviewRecord};
use crate::remote::{DeployMode, DeployOutcome};

const NO_SUBMISSION: &str =
    "There was an error fetching this submission. Ensure this module has been submitted";

impl Engine {
    async fn open_record(&self, app: &str, module: &str) -> ZeedasResult<ReviewRecord> {
        self.reviews
            .find(app, module)
            .await?
            .ok_or_else(|| bad_input(NO_SUBMISSION))
    }

    /// Ensure `<module>-zeedas` exists off QA. Never fails; problems are logged.
    pub async fn create_branch(&self, app: &str, module: &str) {
        let result = async {
            let (record, gateway) = self.load_default(app).await?;
            let access = default_binding(&record)?.access()?;
            Ok::<_, crate::error::ZeedasError>(gateway.create_feature_branch(access, module).await)
        }
        .await;
        match result {
            Ok(created) => debug!(app, module, created, "feature branch ensured"),
            Err(e) => warn!(app, module, error = %e, "feature branch not created"),
        }
    }

    /// Open or refresh the submission review for `module` and record every
    /// file version not seen before.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` without a default binding (before any network call),
    /// `InvalidAccessCredentials` for provider failures.
    pub async fn submit(&self, app: &str, module: &str) -> ZeedasResult<ReviewRecord> {
        let _serial = self.locks.lock(&module_key(app, module)).await;

        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;
        let feature = feature_branch(module);

        let mut review = match self.reviews.find(app, module).await? {
            Some(review) => review,
            None => {
                let id = gateway
                    .open_review(access, &feature, QA_BRANCH, &submission_title(module))
                    .await?;
                info!(app, module, review = %id, "opened submission review");
                let review = ReviewRecord::new(app, module, id);
                self.reviews.save(&review).await?;
                review
            }
        };

        let mut added = 0usize;
        for commit in gateway.list_review_commits(access, &review.review_id).await? {
            for diff in gateway.diff_for_commit(access, &commit).await? {
                if review.has_version(&diff.path, &diff.diff) {
                    continue;
                }
                let stored = async {
                    let entry = gateway.read_file(access, &feature, &diff.path).await?;
                    let source = entry
                        .download_url
                        .ok_or_else(|| bad_input(format!("{} has no download url", diff.path)))?;
                    self.artifacts
                        .save_file(app, module, &commit.id, &diff.path, &source)
                        .await
                }
                .await;
                match stored {
                    Ok(download_url) => {
                        if review.push_version(DiffVersion {
                            path: diff.path,
                            diff: diff.diff,
                            created_at: commit.created_at.clone(),
                            download_url,
                        }) {
                            added += 1;
                        }
                    }
                    Err(e) => {
                        warn!(app, module, path = %diff.path, error = %e, "snapshot failed, version not recorded");
                    }
                }
            }
        }

        review.submission_count += 1;
        self.reviews.save(&review).await?;
        info!(
            app,
            module,
            added,
            submissions = review.submission_count,
            "submission recorded"
        );
        Ok(review)
    }

    /// Promote QA to MAIN, deploy, and close the submission.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if nothing is submitted for `module`,
    /// `InvalidAccessCredentials` if the merge fails (the record is kept).
    pub async fn approve(&self, app: &str, module: &str) -> ZeedasResult<Option<DeployOutcome>> {
        let _serial = self.locks.lock(&module_key(app, module)).await;

        let review = self.open_record(app, module).await?;
        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;

        let id = match gateway.find_open_review(access, QA_BRANCH, MAIN_BRANCH).await? {
            Some(id) => id,
            None => {
                gateway
                    .open_review(access, QA_BRANCH, MAIN_BRANCH, &submission_title(&review.module))
                    .await?
            }
        };
        gateway.merge_review(access, &id).await?;
        info!(app, module, review = %id, "promoted {QA_BRANCH} to {MAIN_BRANCH}");

        let outcome = match &record.server {
            Some(profile) => Some(self.deployer.deploy(app, profile, DeployMode::Full).await),
            None => None,
        };
        self.reviews.delete(app, module).await?;
        Ok(outcome)
    }

    /// Revert the submission's commits on the server and close it.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if nothing is submitted for `module`,
    /// `InvalidAccessCredentials` if the commits cannot be listed.
    pub async fn reject(&self, app: &str, module: &str) -> ZeedasResult<Option<DeployOutcome>> {
        let _serial = self.locks.lock(&module_key(app, module)).await;

        let review = self.open_record(app, module).await?;
        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;

        let commits: Vec<String> = gateway
            .list_review_commits(access, &review.review_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        info!(app, module, commits = commits.len(), "rejecting submission");

        let outcome = match &record.server {
            Some(profile) => Some(self.deployer.revert(app, profile, &commits, module).await),
            None => None,
        };
        self.reviews.delete(app, module).await?;
        Ok(outcome)
    }

    /// Merge the submission into QA and run a test-config deployment. The
    /// record stays open.
    ///
    /// # Errors
    ///
    /// `BadInputFormat` if nothing is submitted for `module`,
    /// `InvalidAccessCredentials` if the merge fails.
    pub async fn test_submission(
        &self,
        app: &str,
        module: &str,
    ) -> ZeedasResult<Option<DeployOutcome>> {
        let _serial = self.locks.lock(&module_key(app, module)).await;

        let review = self.open_record(app, module).await?;
        let (record, gateway) = self.load_default(app).await?;
        let access = default_binding(&record)?.access()?;

        gateway.merge_review(access, &review.review_id).await?;
        info!(app, module, review = %review.review_id, "submission merged for testing");

        Ok(match &record.server {
            Some(profile) => Some(self.deployer.deploy(app, profile, DeployMode::TestConfig).await),
            None => None,
        })
    }

    /// The open review record for `module`, if any.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn fetch_submission(
        &self,
        app: &str,
        module: &str,
    ) -> ZeedasResult<Option<ReviewRecord>> {
        Ok(self.reviews.find(app, module).await?)
    }
}
