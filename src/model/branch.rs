// zeedas-rs: Provider-unified review workflow and deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch naming. These literals are the join key between review records
//! and provider branches, so they must stay bit-exact.

/// Production baseline.
pub const MAIN_BRANCH: &str = "master-zeedas";

/// Review baseline; feature branches are opened against it.
pub const QA_BRANCH: &str = "qa-zeedas";

/// Appended to a module id to form its feature branch.
pub const FEATURE_SUFFIX: &str = "-zeedas";

/// `<module>-zeedas`
#[must_use]
pub fn feature_branch(module: &str) -> String {
    format!("{module}{FEATURE_SUFFIX}")
}

/// Title of the feature -> QA review.
#[must_use]
pub fn submission_title(module: &str) -> String {
    format!("Submission for {module}")
}

/// Commit message of the aggregate revert commit.
#[must_use]
pub fn revert_message(module: &str) -> String {
    format!("Reverting Submission for {module}")
}

/// Commit message used when staging an empty file on a feature branch.
#[must_use]
pub fn add_file_message(branch: &str) -> String {
    format!("Adding file to task {branch}")
}
