mod test_ik_round_trip;
mod test_program;
