pub mod bitrise;
