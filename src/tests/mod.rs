pub mod test_optimizer;
