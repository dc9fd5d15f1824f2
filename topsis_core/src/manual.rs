/*!

This is the long-form manual for `topsis_core` and the `topsis` command line tool.

## The algorithm

TOPSIS (Technique for Order Preference by Similarity to Ideal Solution) ranks a
set of alternatives described by numeric criteria. Each criterion has a weight
and a direction: `+` when larger values are better (a benefit), `-` when
smaller values are better (a cost).

1. The weights are divided by their sum.
2. Each criterion column is divided by its Euclidean norm. A column that is
   zero everywhere is left at zero.
3. Each column is multiplied by its weight.
4. The ideal best takes, for every criterion, the best value found in the
   column (the maximum for `+`, the minimum for `-`). The ideal worst takes
   the other extreme.
5. Every alternative gets its Euclidean distance to both ideal points, and a
   score `dist_worst / (dist_best + dist_worst)` in `[0, 1]`.
6. Alternatives are ranked by decreasing score. Ties share the same rank,
   which is the number of alternatives scoring at least as much. Two
   alternatives tied at the top both get rank 2, and there is no rank 1.

When an alternative is at zero distance of both ideal points (every
criterion is constant, for example with a single alternative), its score is
undefined. By default this is an error; the `Fallback` policy of
[`DegenerateScorePolicy`](crate::DegenerateScorePolicy) assigns a fixed score
instead.

## Input format

A table with a header row. The first column names the alternatives and is
copied unchanged to the output. All the other columns are criteria and must
contain numbers in every row: empty cells are errors, not zeros.

| Model | Price | Storage | Camera | Looks |
|-------|-------|---------|--------|-------|
| M1    | 250   | 16      | 12     | 5     |
| M2    | 200   | 16      | 8      | 3     |
| ...   |       |         |        |       |

The `topsis` program reads comma-separated files (`csv`) and the first or a
named worksheet of Excel files (`excel`, `.xlsx`).

Weights and impacts are given as comma-separated lists with one entry per
criterion, for example `1,1,1,2` and `-,+,+,+`.

## Output format

The input table with two extra columns, `Score` and `Rank`, in the same row
order as the input. These two names are reserved: an input table that
already has a `Score` or `Rank` column is rejected.

## Command line

```bash
topsis -i phones.csv -w "1,1,1,1" --impacts "-,+,+,-" -o result.csv
```

* `--input-type` `csv` or `excel`. By default it is inferred from the extension.
* `--out` a file path or `stdout` (the default).
* `--summary` writes a JSON summary with the normalized weights, the ideal
  points and each alternative's score and rank.
* `--reference` compares the result with an expected CSV file and fails if
  they differ.
* `--fallback-score` scores degenerate alternatives with the given value
  instead of failing.
* `--verbose` turns on debug logging. Otherwise `RUST_LOG` applies.

## Configuration

All the settings can also be stored in a JSON file passed with `--config`.
Paths are relative to the directory of the configuration file. Flags given on
the command line take precedence.

```json
{
  "input": { "filePath": "phones.csv", "provider": "csv" },
  "weights": "1,1,1,1",
  "impacts": "-,+,+,-",
  "output": { "filePath": "result.csv", "summaryPath": "summary.json" },
  "rules": { "degenerateScore": "fallback", "fallbackScore": 0.5 }
}
```

*/
