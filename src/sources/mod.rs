pub mod netease;
