pub mod os_env;
