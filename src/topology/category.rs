//! Icon categories.
//!
//! Graphviz has no notion of provider icons, so each category maps to a
//! provider group (shown under the label) and a fill color from the
//! provider's palette.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Route53,
    CloudFront,
    S3,
    Alb,
    Ecs,
    Ecr,
    Rds,
    Iam,
    SecurityGroup,
    CloudWatch,
    GitHubActions,
    Terraform,
}

impl Category {
    /// Provider group, e.g. `aws.network`.
    pub fn group(self) -> &'static str {
        match self {
            Category::Route53 | Category::CloudFront | Category::Alb => "aws.network",
            Category::Ecs | Category::Ecr => "aws.compute",
            Category::Rds => "aws.database",
            Category::S3 => "aws.storage",
            Category::Iam | Category::SecurityGroup => "aws.security",
            Category::CloudWatch => "aws.management",
            Category::GitHubActions => "onprem.ci",
            Category::Terraform => "onprem.iac",
        }
    }

    pub fn fill_color(self) -> &'static str {
        match self {
            Category::Route53 | Category::CloudFront | Category::Alb => "#8C4FFF",
            Category::Ecs | Category::Ecr => "#ED7100",
            Category::Rds => "#C925D1",
            Category::S3 => "#7AA116",
            Category::Iam | Category::SecurityGroup => "#DD344C",
            Category::CloudWatch => "#E7157B",
            Category::GitHubActions => "#24292F",
            Category::Terraform => "#7B42BC",
        }
    }

    /// Short product name, used when a node is listed without its label.
    pub fn name(self) -> &'static str {
        match self {
            Category::Route53 => "Route53",
            Category::CloudFront => "CloudFront",
            Category::S3 => "S3",
            Category::Alb => "ALB",
            Category::Ecs => "ECS",
            Category::Ecr => "ECR",
            Category::Rds => "RDS",
            Category::Iam => "IAM",
            Category::SecurityGroup => "SecurityGroup",
            Category::CloudWatch => "CloudWatch",
            Category::GitHubActions => "GitHubActions",
            Category::Terraform => "Terraform",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group(), self.name())
    }
}
