//! Built-in topologies.
//!
//! `Aws` is the current deployment picture (the one the README embeds).
//! `Overview` is the earlier layered view with security groups; both are kept
//! because they are maintained as separate snapshots.

use crate::Result;
use crate::render::OutputFormat;
use crate::topology::{Category, Diagram, DiagramBuilder, Direction, EdgeStyle};

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// AWS deployment with CI/CD tooling (PNG, embedded in the README).
    #[default]
    Aws,
    /// Layered overview with security groups and IAM role (SVG).
    Overview,
}

impl Preset {
    /// File name stem, before the timestamp suffix.
    pub fn base_name(self) -> &'static str {
        match self {
            Preset::Aws => "nestjs-hannibal-3-architecture",
            Preset::Overview => "architecture",
        }
    }

    pub fn default_format(self) -> OutputFormat {
        match self {
            Preset::Aws => OutputFormat::Png,
            Preset::Overview => OutputFormat::Svg,
        }
    }

    pub fn diagram(self) -> Result<Diagram> {
        match self {
            Preset::Aws => aws(),
            Preset::Overview => overview(),
        }
    }
}

fn aws() -> Result<Diagram> {
    let mut b = DiagramBuilder::new("AWS Architecture")
        .direction(Direction::TB)
        .graph_attr("fontsize", "16")
        .graph_attr("bgcolor", "white");

    // DNS & CDN, plus the CI/CD tools that ship to it.
    let dns = b.node("Route53\nhamilcar-hannibal.click", Category::Route53, None);
    b.node("GitHub Actions", Category::GitHubActions, None);
    b.node("Terraform", Category::Terraform, None);
    let cf = b.node("CloudFront", Category::CloudFront, None);

    let s3 = b.node("S3 Frontend", Category::S3, None);
    let alb = b.node("ALB", Category::Alb, None);

    let fargate = b.cluster("ECS Fargate", None);
    let ecs = b.node("ECS Service", Category::Ecs, Some(fargate));
    let ecr = b.node("ECR", Category::Ecr, Some(fargate));

    let rds = b.node("RDS PostgreSQL", Category::Rds, None);

    let ops = b.cluster("Security & Monitoring", None);
    let iam = b.node("IAM", Category::Iam, Some(ops));
    let logs = b.node("CloudWatch", Category::CloudWatch, Some(ops));

    // Network flow
    b.edge(dns, cf);
    b.edge(cf, s3);
    b.edge(cf, alb);
    b.edge(alb, ecs);
    b.edge(ecs, rds);

    // Image pulls
    b.edge(ecr, ecs);

    b.edge(iam, ecs);
    b.edge(ecs, logs);

    b.build()
}

fn overview() -> Result<Diagram> {
    let mut b = DiagramBuilder::new("NestJS Hannibal 3 Architecture").direction(Direction::TB);

    let dns = b.node("hamilcar-hannibal.click", Category::Route53, None);

    let frontend = b.cluster("Frontend & CDN", None);
    let cf = b.node("CloudFront Distribution", Category::CloudFront, Some(frontend));
    let s3 = b.node("Static Files\n(React App)", Category::S3, Some(frontend));

    let app = b.cluster("Application Layer", None);
    let alb = b.node("Application\nLoad Balancer", Category::Alb, Some(app));
    let fargate = b.cluster("ECS Fargate Cluster", Some(app));
    let ecs = b.node("API Service\n(NestJS)", Category::Ecs, Some(fargate));

    let data = b.cluster("Database Layer", None);
    let rds = b.node("PostgreSQL\nDatabase", Category::Rds, Some(data));

    let sec = b.cluster("Security & Monitoring", None);
    let sg_alb = b.node("ALB\nSecurity Group", Category::SecurityGroup, Some(sec));
    let sg_ecs = b.node("ECS\nSecurity Group", Category::SecurityGroup, Some(sec));
    let sg_rds = b.node("RDS\nSecurity Group", Category::SecurityGroup, Some(sec));
    let role = b.node("ECS Task\nExecution Role", Category::Iam, Some(sec));
    let logs = b.node("CloudWatch\nLogs", Category::CloudWatch, Some(sec));

    b.edge(dns, cf);
    b.edge_styled(cf, s3, EdgeStyle::labeled("Static Files\n(/, /assets/*)"));
    b.edge_styled(cf, alb, EdgeStyle::labeled("API Requests\n(/api/*)"));
    b.edge(alb, ecs);
    b.edge(ecs, rds);

    b.edge_styled(sg_alb, alb, EdgeStyle::dashed("orange"));
    b.edge_styled(sg_ecs, ecs, EdgeStyle::dashed("orange"));
    b.edge_styled(sg_rds, rds, EdgeStyle::dashed("orange"));
    b.edge_styled(role, ecs, EdgeStyle::dashed("blue"));
    b.edge_styled(ecs, logs, EdgeStyle::dashed("green"));

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::LineStyle;

    #[test]
    fn aws_preset_shape() {
        let d = Preset::Aws.diagram().unwrap();
        assert_eq!(d.title, "AWS Architecture");
        assert_eq!(d.nodes.len(), 11);
        assert_eq!(d.edges.len(), 8);
        assert_eq!(d.clusters.len(), 2);
        assert_eq!(d.graph_attrs.get("fontsize").map(String::as_str), Some("16"));
    }

    #[test]
    fn overview_preset_has_nested_cluster_and_styled_edges() {
        let d = Preset::Overview.diagram().unwrap();
        let nested: Vec<_> = d.clusters.iter().filter(|c| c.parent.is_some()).collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].label, "ECS Fargate Cluster");

        let dashed = d
            .edges
            .iter()
            .filter(|e| e.style.line == Some(LineStyle::Dashed))
            .count();
        assert_eq!(dashed, 5);
        let labeled = d.edges.iter().filter(|e| e.style.label.is_some()).count();
        assert_eq!(labeled, 2);
    }

    #[test]
    fn preset_defaults() {
        assert_eq!(Preset::Aws.default_format(), OutputFormat::Png);
        assert_eq!(Preset::Overview.default_format(), OutputFormat::Svg);
        assert_eq!(Preset::Aws.base_name(), "nestjs-hannibal-3-architecture");
    }
}
