mod test_day_order;
