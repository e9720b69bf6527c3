use env_util::{env_var, get_env, get_env_or, override_env, print_env, reset_environment, set_env, EnvError};

fn main() -> Result<(), EnvError> {
    // Regular code reads through the cache instead of std::env.
    let shell = get_env_or("SHELL", "/bin/sh");
    println!("Shell: {}", shell);

    match get_env("DATABASE_URL") {
        Ok(url) => println!("Database: {}", url),
        Err(e) => println!("{}", e),
    }

    // Test setup overrides the cache, the real environment stays untouched.
    set_env("DATABASE_URL", "postgres://localhost/test");
    println!("Database (overridden): {}", env_var!("DATABASE_URL")?);

    if override_env("PATH", "/usr/bin").is_ok() {
        println!("PATH (overridden): {}", get_env("PATH")?);
    }

    reset_environment();
    println!("{} variables after reset", print_env().lines().count());

    Ok(())
}
