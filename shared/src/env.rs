use std::env;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// ENV が未設定の場合はビルドプロファイルから決める
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match env::var("ENV") {
        Err(_) => default_env,
        Ok(v) if v == "production" => Environment::Production,
        Ok(v) if v == "development" => Environment::Development,
        Ok(_) => default_env,
    }
}
