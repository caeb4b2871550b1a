pub mod synthetic_sections;
