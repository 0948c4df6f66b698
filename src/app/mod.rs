// Application layer: concrete pipelines wired from domain ports and core stages.

pub mod pipelines;
