mod cheater;
