use stackguard_types::{Finding, Level, StackguardData, Verdict};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub warn: u32,
    pub error: u32,
}

impl LevelCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = LevelCounts::default();
        for f in findings {
            match f.level {
                Level::Warn => counts.warn += 1,
                Level::Error => counts.error += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: StackguardData,
    pub counts: LevelCounts,
}
