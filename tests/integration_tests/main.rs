mod setup;
mod test_config;
mod test_console;
