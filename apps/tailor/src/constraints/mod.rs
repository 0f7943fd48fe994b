pub mod schema;

pub use schema::{
    CompanyRules, ConstraintSchema, HeaderRules, ProjectsRules, SkillsRules, SummaryRules,
    PROJECT_BULLET_FIELDS,
};
